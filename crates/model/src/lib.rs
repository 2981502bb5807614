pub mod core {
    pub mod data_type;
    pub mod error;
    pub mod value;
}

pub mod records {
    pub mod column;
    pub mod frame;
    pub mod row_set;
}
