pub mod final_page;
pub mod result_page;
pub mod scanning_page;
pub mod upload_page;
pub mod utils;
