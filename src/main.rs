use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use is_terminal::IsTerminal;
use kit::areas::repository::Repository;
use kit::artifacts::core::PagerWriter;
use kit::commands::plumbing::cat_file::CatFileMode;

#[derive(Parser)]
#[command(
    name = "kit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A simple version control system",
    long_about = "This is a minimal version control system in the spirit of git, \
    written in Rust. It tracks a project through a content-addressed object store, \
    a staging index and branch references, all kept under a .kit directory.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command hashes the given files into the object database and records them \
        in the staging index. Directories are expanded to every file they contain."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "unstage",
        about = "Remove a file from the staging index",
        long_about = "This command removes the given file from the staging index. \
        The working directory copy is left untouched."
    )]
    Unstage {
        #[arg(index = 1, help = "The file to unstage")]
        path: String,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command compares the working directory, the staging index and the HEAD \
        commit, and reports staged changes, unstaged changes and untracked files."
    )]
    Status {
        #[arg(long, help = "Machine-readable two-column output")]
        porcelain: bool,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit in the repository with the specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "checkout",
        about = "Switch to a branch, tag or commit",
        long_about = "This command materializes the snapshot recorded by the given branch, tag or \
        commit hash into the working directory and moves HEAD to it."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch, tag or commit to check out")]
        target: String,
    },
    #[command(
        name = "branch",
        about = "List branches or create a new one",
        long_about = "With no arguments this command lists the local branches, marking the current \
        one. With a name it creates a branch pointing at the given start point, or at HEAD."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: Option<String>,
        #[arg(index = 2, help = "The commit or ref the branch should start from")]
        start_point: Option<String>,
    },
    #[command(
        name = "tag",
        about = "List tags or create a new one",
        long_about = "With no arguments this command lists the tags. With a name it creates a \
        lightweight tag pointing at the given target, or at HEAD."
    )]
    Tag {
        #[arg(index = 1, help = "The name of the tag to create")]
        name: Option<String>,
        #[arg(short, long, help = "The tag message (accepted, not stored)")]
        message: Option<String>,
        #[arg(index = 2, help = "The commit or ref to tag")]
        target: Option<String>,
    },
    #[command(
        name = "log",
        about = "Show the commit history",
        long_about = "This command walks the history from HEAD back to the root commit, printing \
        one line per commit with its branch and tag decorations."
    )]
    Log,
    #[command(
        name = "config",
        about = "Get or set a configuration value",
        long_about = "This command reads or writes a section.key entry in the repository \
        configuration file."
    )]
    Config {
        #[arg(index = 1, help = "The configuration key, as section.key")]
        name: String,
        #[arg(index = 2, help = "The value to set; omit to print the current value")]
        value: Option<String>,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes an object file and can write it to the object database. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the type, size or content of an object",
        long_about = "This command inspects an object in the object database by its hash, \
        full or abbreviated.",
        group(ArgGroup::new("inspect").required(true))
    )]
    CatFile {
        #[arg(short = 'p', group = "inspect", help = "Pretty-print the object content")]
        pretty_print: bool,
        #[arg(short = 't', group = "inspect", help = "Print the object type")]
        show_type: bool,
        #[arg(short = 's', group = "inspect", help = "Print the object payload size")]
        show_size: bool,
        #[arg(index = 1, help = "The object hash to inspect")]
        object: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "This command lists the files recorded by a tree object, resolving a branch, \
        tag or commit argument to the tree it snapshots."
    )]
    LsTree {
        #[arg(long, help = "Print only file paths")]
        name_only: bool,
        #[arg(index = 1, help = "The tree, commit, branch or tag to list")]
        tree_ish: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()))?,
                None => repository_at_cwd()?,
            };

            repository.init()?
        }
        Commands::Add { paths } => repository_at_cwd()?.add(paths)?,
        Commands::Unstage { path } => repository_at_cwd()?.unstage(path)?,
        Commands::Status { porcelain } => repository_at_cwd()?.status(*porcelain)?,
        Commands::Commit { message } => repository_at_cwd()?.commit(message.as_str())?,
        Commands::Checkout { target } => repository_at_cwd()?.checkout(target)?,
        Commands::Branch { name, start_point } => {
            repository_at_cwd()?.branch(name.as_deref(), start_point.as_deref())?
        }
        Commands::Tag {
            name,
            message,
            target,
        } => repository_at_cwd()?.tag(name.as_deref(), message.as_deref(), target.as_deref())?,
        Commands::Log => {
            let use_pager =
                std::io::stdout().is_terminal() && std::env::var_os("NO_PAGER").is_none();

            if use_pager {
                let pager = minus::Pager::new();
                let repository = repository_with_writer(Box::new(PagerWriter::new(pager.clone())))?;

                repository.log()?;
                minus::page_all(pager)?;
            } else {
                repository_at_cwd()?.log()?;
            }
        }
        Commands::Config { name, value } => {
            let repository = repository_at_cwd()?;

            match value {
                Some(value) => repository.config_set(name, value)?,
                None => repository.config_get(name)?,
            }
        }
        Commands::HashObject { write, file } => repository_at_cwd()?.hash_object(file, *write)?,
        Commands::CatFile {
            pretty_print: _,
            show_type,
            show_size,
            object,
        } => {
            let mode = if *show_type {
                CatFileMode::Type
            } else if *show_size {
                CatFileMode::Size
            } else {
                CatFileMode::PrettyPrint
            };

            repository_at_cwd()?.cat_file(object, mode)?
        }
        Commands::LsTree {
            name_only,
            tree_ish,
        } => repository_at_cwd()?.ls_tree(tree_ish, *name_only)?,
    }

    Ok(())
}

fn repository_at_cwd() -> Result<Repository> {
    repository_with_writer(Box::new(std::io::stdout()))
}

fn repository_with_writer(writer: Box<dyn std::io::Write>) -> Result<Repository> {
    let pwd = std::env::current_dir()?;

    Repository::new(&pwd.to_string_lossy(), writer)
}
