pub mod payment_reader;
pub mod response_writer;
