use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "blog-server", description = "Personal blog backend"),
    paths(
        crate::handlers::health::health,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::me,
        crate::handlers::auth::change_username,
        crate::handlers::auth::change_password,
        crate::handlers::posts::list_posts,
        crate::handlers::posts::list_categories,
        crate::handlers::posts::get_post,
        crate::handlers::admin::list_posts,
        crate::handlers::admin::get_post,
        crate::handlers::admin::create_post,
        crate::handlers::admin::update_post,
        crate::handlers::admin::delete_post,
    ),
    components(schemas(
        blog_api::LoginRequest,
        blog_api::ChangeUsernameRequest,
        blog_api::ChangePasswordRequest,
        blog_api::CreatePostRequest,
        blog_api::UpdatePostRequest,
        blog_api::UserResponse,
        blog_api::LoginResponse,
        blog_api::PostResponse,
        blog_api::MessageResponse,
        blog_api::HealthResponse,
        blog_api::ErrorEnvelope,
        blog_api::FieldError,
    )),
    tags(
        (name = "Health"),
        (name = "Auth"),
        (name = "Posts"),
        (name = "Admin"),
    )
)]
pub struct ApiDoc;
