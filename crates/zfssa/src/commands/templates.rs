//! Sample input files.

use zfssa_core::{TemplateKind, TemplateMode, write_template};

use crate::cli::{TemplateKindFlags, TemplateModeFlags, TemplatesArgs};
use crate::error::CliError;

fn kind(flags: TemplateKindFlags) -> TemplateKind {
    if flags.projects {
        TemplateKind::Projects
    } else if flags.filesystems {
        TemplateKind::Filesystems
    } else if flags.luns {
        TemplateKind::Luns
    } else {
        TemplateKind::Snapshots
    }
}

fn mode(flags: TemplateModeFlags) -> TemplateMode {
    if flags.create {
        TemplateMode::Create
    } else {
        TemplateMode::Delete
    }
}

pub fn handle(args: &TemplatesArgs) -> Result<(), CliError> {
    let path = write_template(&args.dir, kind(args.kind), mode(args.mode))?;
    println!("Created file '{}'", path.display());
    Ok(())
}
