pub mod adapter;
pub mod error;
pub mod spec;

pub mod sql {
    pub mod base {
        pub mod adapter;
        pub mod error;
        pub mod row;
    }

    pub mod mysql {
        pub mod adapter;
        pub mod data_type;
    }

    pub mod postgres {
        pub mod adapter;
    }

    pub mod sqlite {
        pub mod adapter;
    }
}
