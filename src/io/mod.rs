pub mod input_file;
pub mod line_reader;
