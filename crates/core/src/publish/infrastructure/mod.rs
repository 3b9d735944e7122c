pub mod channel_publisher;
pub mod json_line_publisher;
