use crate::domain::payment::PaymentResponse;
use crate::error::Result;
use std::io::Write;

/// Writes projected payment responses as CSV rows.
pub struct ResponseWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(sink),
        }
    }

    pub fn write_response(&mut self, response: &PaymentResponse) -> Result<()> {
        self.writer.serialize(response)?;
        self.writer.flush()?;
        Ok(())
    }
}
