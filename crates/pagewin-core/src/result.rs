use crate::error::PagewinError;

pub type PagewinResult<T> = Result<T, PagewinError>;
