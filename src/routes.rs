use actix_web::web;

use crate::api::{attachment, audit, leave_request, user};
use crate::auth::handlers;
use crate::config::Config;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Public routes
    cfg.service(
        web::scope("/auth").service(web::resource("/login").route(web::post().to(handlers::login))),
    );

    // Protected routes (bearer token, checked by the AuthUser extractor)
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/pending (before /{id} so the literal wins)
                    .service(
                        web::resource("/pending")
                            .route(web::get().to(leave_request::pending_leave_list)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    ),
            )
            .service(
                web::scope("/overlap")
                    .service(
                        web::resource("/employee")
                            .route(web::get().to(leave_request::employee_overlap)),
                    )
                    .service(
                        web::resource("/department")
                            .route(web::get().to(leave_request::department_overlap)),
                    ),
            )
            .service(web::resource("/audit").route(web::get().to(audit::audit_list)))
            .service(web::resource("/users/{id}").route(web::get().to(user::get_user)))
            .service(
                web::scope("/attachments")
                    .service(
                        web::resource("").route(web::post().to(attachment::upload_attachment)),
                    )
                    .service(
                        web::resource("/{reference:.*}")
                            .route(web::get().to(attachment::download_attachment)),
                    ),
            ),
    );
}
