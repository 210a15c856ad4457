pub mod delivery_reader;
pub mod report_writer;
