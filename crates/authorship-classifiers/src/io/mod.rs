pub mod tweets_tsv;

pub use tweets_tsv::{read_raw_tsv, write_table_tsv};
