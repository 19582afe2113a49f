//! 存储层
//!
//! 所有表都是只追加的 CSV 文件，每写一行都会落盘。

pub mod csv_table;
pub mod ranked_reader;
pub mod record_store;

pub use csv_table::{append_row, count_rows, init_table, read_links};
pub use ranked_reader::{read_ranked, RankedDomains};
pub use record_store::{RecordStore, ResumeCounters, LINKS_HEADER, VISITED_HEADER, VITALS_HEADER};
