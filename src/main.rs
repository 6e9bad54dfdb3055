use clap::Parser;

use oxsh::io::InputSource;
use oxsh::shell::{Shell, ShellOptions};

#[derive(Parser)]
#[command(name = "oxsh")]
#[command(about = "A small POSIX-style shell interpreter")]
#[command(version)]
struct Cli {
    /// Print each parsed syntax tree before executing it
    #[arg(long = "pretty-print")]
    pretty_print: bool,

    /// Execute the script passed as an argument
    #[arg(short = 'c')]
    script: Option<String>,

    /// Script file to execute (stdin when absent)
    #[arg()]
    script_file: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if cli.pretty_print {
        println!("PRETTY-PRINT: Activated.");
    }

    let source = if let Some(script) = &cli.script {
        InputSource::from_string(script)
    } else if let Some(file) = &cli.script_file {
        match InputSource::from_file(file) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("oxsh: {file}: {e}");
                std::process::exit(1);
            }
        }
    } else {
        match InputSource::from_stdin() {
            Ok(source) => source,
            Err(e) => {
                eprintln!("oxsh: stdin: {e}");
                std::process::exit(1);
            }
        }
    };

    let mut shell = Shell::new(ShellOptions {
        pretty_print: cli.pretty_print,
    });
    std::process::exit(shell.run(source));
}
