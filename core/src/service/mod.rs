pub mod dto;
pub mod invoice_builder;
pub mod row_manager;
