use crate::core::{ParseStatus, ProjectDI, Service};
use crate::io::output::OutputWriter;
use colored::*;
use std::io::Write;
use std::path::Path;

const RULE: &str = "───────────────────────────────────────────";

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self, project: &ProjectDI) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "═══════════════════════════════════════════".blue())?;
        writeln!(
            self.writer,
            "{}",
            format!("  DI MAP: {}", project.project_name).bold().blue()
        )?;
        writeln!(self.writer, "{}", "═══════════════════════════════════════════".blue())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, project: &ProjectDI) -> anyhow::Result<()> {
        writeln!(self.writer, "📊 {}", "SUMMARY".bold())?;
        writeln!(self.writer, "{RULE}")?;
        writeln!(self.writer, "  Status:         {}", format_status(project.parse_status))?;
        writeln!(self.writer, "  Services:       {}", project.services().len())?;
        writeln!(self.writer, "  Registrations:  {}", project.registration_count())?;
        writeln!(self.writer, "  Conflicts:      {}", project.conflict_count())?;
        writeln!(self.writer, "  Cycles:         {}", project.cycles.len())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_groups(&mut self, project: &ProjectDI) -> anyhow::Result<()> {
        for group in &project.service_groups {
            writeln!(
                self.writer,
                "📦 {} ({} services)",
                group.lifetime.name().to_uppercase().bold(),
                group.count
            )?;
            writeln!(self.writer, "{RULE}")?;
            for service in &group.services {
                self.write_service(service, &project.project_path)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_service(&mut self, service: &Service, root: &Path) -> anyhow::Result<()> {
        let name = if service.has_conflicts {
            service.name.yellow().bold()
        } else {
            service.name.bold()
        };
        writeln!(
            self.writer,
            "  {} ({} registrations, {} injection sites)",
            name,
            service.registrations.len(),
            service.injection_sites.len()
        )?;

        for registration in &service.registrations {
            writeln!(
                self.writer,
                "    + {} -> {} [{}] {}:{}",
                registration.service_type,
                registration.implementation_type,
                registration.lifetime,
                display_path(&registration.file_path, root),
                registration.line_number
            )?;
        }
        for site in &service.injection_sites {
            writeln!(
                self.writer,
                "    < {}.{} ({}) {}:{}",
                site.class_name,
                site.member_name,
                site.kind,
                display_path(&site.file_path, root),
                site.line_number
            )?;
        }
        for conflict in &service.conflicts {
            writeln!(
                self.writer,
                "    {} {}: {}",
                "!".yellow(),
                conflict.kind.to_string().yellow(),
                conflict.details
            )?;
        }
        Ok(())
    }

    fn write_unregistered(&mut self, project: &ProjectDI) -> anyhow::Result<()> {
        if project.unregistered_services.is_empty() {
            return Ok(());
        }
        writeln!(
            self.writer,
            "⚠️  {} ({})",
            "UNREGISTERED SERVICES".bold().red(),
            project.unregistered_services.len()
        )?;
        writeln!(self.writer, "{RULE}")?;
        for service in &project.unregistered_services {
            self.write_service(service, &project.project_path)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_cycles(&mut self, project: &ProjectDI) -> anyhow::Result<()> {
        if project.cycles.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "🔁 {} ({})", "CYCLES".bold().red(), project.cycles.len())?;
        writeln!(self.writer, "{RULE}")?;
        for cycle in &project.cycles {
            writeln!(self.writer, "  {}", cycle.red())?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_errors(&mut self, project: &ProjectDI) -> anyhow::Result<()> {
        let Some(errors) = project.error_details.as_ref().filter(|e| !e.is_empty()) else {
            return Ok(());
        };
        writeln!(self.writer, "❌ {} ({})", "ERRORS".bold().red(), errors.len())?;
        writeln!(self.writer, "{RULE}")?;
        for error in errors {
            writeln!(self.writer, "  {error}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_project(&mut self, project: &ProjectDI) -> anyhow::Result<()> {
        self.write_header(project)?;
        self.write_summary(project)?;
        self.write_groups(project)?;
        self.write_unregistered(project)?;
        self.write_cycles(project)?;
        self.write_errors(project)?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_projects(&mut self, projects: &[ProjectDI]) -> anyhow::Result<()> {
        projects.iter().try_for_each(|p| self.write_project(p))
    }
}

fn format_status(status: ParseStatus) -> ColoredString {
    match status {
        ParseStatus::Success => status.to_string().green(),
        ParseStatus::Partial => status.to_string().yellow(),
        ParseStatus::Failed => status.to_string().red(),
    }
}

/// `path` relative to the project root when it lies beneath it.
fn display_path(path: &Path, root: &Path) -> String {
    if path.is_relative() {
        return path.display().to_string();
    }
    pathdiff::diff_paths(path, root)
        .filter(|relative| !relative.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
