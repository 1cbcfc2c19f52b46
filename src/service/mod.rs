pub mod notion_service;
pub mod page_service;
pub mod recurring_service;
pub mod schema_service;
