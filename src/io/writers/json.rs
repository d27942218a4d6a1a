use crate::core::ProjectDI;
use crate::io::output::OutputWriter;
use std::io::Write;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_project(&mut self, project: &ProjectDI) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(project)?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_projects(&mut self, projects: &[ProjectDI]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(projects)?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }
}
