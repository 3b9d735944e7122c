pub mod readiness_publisher;
