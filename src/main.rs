use clap::error::ErrorKind;
use clap::Parser;

mod cmd;
mod error;
mod merge;
mod objects;
mod repo;
mod utils;

use cmd::GitletCommand;

fn main() {
    match GitletCommand::try_parse() {
        Ok(command) => command.execute(),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
            }
            _ => println!("{}", error::GitletError::IncorrectOperands),
        },
    }
}
