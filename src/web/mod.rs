pub mod account;
pub mod comments;
pub mod moderation;
pub mod reports;
pub mod reviews;

/// Configures the web app by adding services from each web file.
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    account::configure(conf);
    comments::configure(conf);
    moderation::configure(conf);
    reports::configure(conf);
    reviews::configure(conf);
}
