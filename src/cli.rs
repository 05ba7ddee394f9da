use crate::models::{CopyTarget, TemplateId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "vidplate - reusable video upload templates",
    long_about = "vidplate stores title, description and tag templates for video uploads. \
                  Write {{name}} in a template, fill the variables in, and copy the result."
)]
pub struct Vidplate {
    #[clap(long, global = true, help = "Template database to use")]
    pub db: Option<PathBuf>,

    #[clap(subcommand)]
    pub commands: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a new template
    Add {
        #[clap(long, short, help = "Name shown in the template list")]
        name: String,

        #[clap(long, short, help = "Title text")]
        title: String,

        #[clap(long, short, default_value = "", help = "Description text")]
        description: String,

        #[clap(long, short = 'g', default_value = "", help = "Comma separated tags")]
        tags: String,
    },
    /// Overwrite an existing template
    Update {
        #[clap(long, help = "Id of the template to update")]
        id: TemplateId,

        #[clap(long, short, help = "Name shown in the template list")]
        name: String,

        #[clap(long, short, help = "Title text")]
        title: String,

        #[clap(long, short, default_value = "", help = "Description text")]
        description: String,

        #[clap(long, short = 'g', default_value = "", help = "Comma separated tags")]
        tags: String,
    },
    /// Delete a template
    Delete {
        #[clap(long, help = "Id of the template to delete")]
        id: TemplateId,

        #[clap(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
    /// List templates, most recent first
    List {
        #[clap(long, help = "Print the list as JSON")]
        json: bool,
    },
    /// Print a template
    Show {
        #[clap(long, help = "Id of the template to show")]
        id: TemplateId,

        #[clap(long, help = "Print the template as JSON")]
        json: bool,
    },
    /// Print the variable names a template uses
    Vars {
        #[clap(long, help = "Id of the template to inspect")]
        id: TemplateId,
    },
    /// Fill in a template's variables and print the result
    Fill {
        #[clap(long, help = "Id of the template to fill in")]
        id: TemplateId,

        #[clap(
            long = "set",
            short = 's',
            value_name = "NAME=VALUE",
            help = "Value for a variable; anything not set is asked for"
        )]
        set: Vec<String>,

        #[clap(long, short, value_enum, help = "Copy part of the result to the clipboard")]
        copy: Option<CopyTarget>,

        #[clap(long, help = "Save the filled-in text back to the template")]
        save: bool,
    },
    /// Copy a stored template to the clipboard as-is
    Copy {
        #[clap(long, help = "Id of the template to copy")]
        id: TemplateId,

        #[clap(long, short, value_enum, default_value = "all", help = "What to copy")]
        mode: CopyTarget,
    },
    /// Keep copied text on the clipboard after vidplate exits
    #[command(name = "hold-clipboard", hide = true)]
    HoldClipboard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::HOLD_SUBCOMMAND;

    fn parse(args: &[&str]) -> Vidplate {
        Vidplate::try_parse_from(args).unwrap()
    }

    #[test]
    fn no_subcommand_opens_the_dashboard() {
        let args = parse(&["vidplate"]);
        assert!(args.commands.is_none());
        assert!(args.db.is_none());
    }

    #[test]
    fn db_flag_is_global() {
        let before = parse(&["vidplate", "--db", "/tmp/a.db", "list"]);
        let after = parse(&["vidplate", "list", "--db", "/tmp/a.db"]);
        assert_eq!(before.db, Some(PathBuf::from("/tmp/a.db")));
        assert_eq!(after.db, before.db);
    }

    #[test]
    fn fill_takes_repeated_values_and_a_copy_mode() {
        let args = parse(&[
            "vidplate", "fill", "--id", "7", "-s", "game=Celeste", "--set", "part=a=b", "--copy",
            "description", "--save",
        ]);
        match args.commands {
            Some(Commands::Fill {
                id,
                set,
                copy,
                save,
            }) => {
                assert_eq!(id, 7);
                assert_eq!(set, vec!["game=Celeste", "part=a=b"]);
                assert_eq!(copy, Some(CopyTarget::Description));
                assert!(save);
            }
            _ => panic!("expected fill"),
        }
    }

    #[test]
    fn copy_mode_defaults_to_everything_and_rejects_unknown_modes() {
        match parse(&["vidplate", "copy", "--id", "1"]).commands {
            Some(Commands::Copy { id: 1, mode }) => assert_eq!(mode, CopyTarget::All),
            _ => panic!("expected copy"),
        }
        assert!(Vidplate::try_parse_from(["vidplate", "copy", "--id", "1", "-m", "thumbnail"]).is_err());
    }

    #[test]
    fn add_requires_name_and_title() {
        assert!(Vidplate::try_parse_from(["vidplate", "add", "-n", "weekly"]).is_err());
        match parse(&["vidplate", "add", "-n", "weekly", "-t", "Week {{n}}"]).commands {
            Some(Commands::Add {
                description, tags, ..
            }) => {
                assert_eq!(description, "");
                assert_eq!(tags, "");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn delete_confirms_unless_told_not_to() {
        assert!(matches!(
            parse(&["vidplate", "delete", "--id", "3"]).commands,
            Some(Commands::Delete { id: 3, yes: false })
        ));
        assert!(matches!(
            parse(&["vidplate", "delete", "--id", "3", "-y"]).commands,
            Some(Commands::Delete { id: 3, yes: true })
        ));
    }

    #[test]
    fn holder_subcommand_matches_what_the_clipboard_spawns() {
        assert!(matches!(
            parse(&["vidplate", HOLD_SUBCOMMAND]).commands,
            Some(Commands::HoldClipboard)
        ));
    }
}
