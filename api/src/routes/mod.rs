pub mod gitlab_webhook;
pub mod test_route;
