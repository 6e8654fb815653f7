//! Numbered menu loop over the roster service.
//!
//! # Invariants
//! - Operation failures are printed and the loop continues.
//! - Only choice 5 or end of input leaves the loop.

use log::{info, warn};
use roster_core::{
    ListReport, OperationReport, UpdateUserRequest, UserRepository, UserService, HEADER,
    NO_USERS_MESSAGE,
};
use std::io::{self, BufRead, Write};

const BANNER: &str = "\n--- User Registration System ---\n\
1. Add User\n\
2. Display All Users\n\
3. Update User\n\
4. Delete User\n\
5. Exit";

/// Runs the menu until the user exits or input ends.
///
/// Startup initializes the store; its failure is printed but does not stop
/// the loop.
pub fn run<R, In, Out>(service: &UserService<R>, mut input: In, mut output: Out) -> io::Result<()>
where
    R: UserRepository,
    In: BufRead,
    Out: Write,
{
    let init = service.initialize();
    if !init.is_success() {
        writeln!(output, "{}", init.message)?;
    }

    loop {
        writeln!(output, "{BANNER}")?;
        let Some(choice) = prompt(&mut input, &mut output, "Enter your choice (1-5): ")? else {
            info!("event=menu_exit module=cli status=ok reason=eof");
            return Ok(());
        };

        match choice.as_str() {
            "1" => add_user(service, &mut input, &mut output)?,
            "2" => display_users(service, &mut output)?,
            "3" => update_user(service, &mut input, &mut output)?,
            "4" => delete_user(service, &mut input, &mut output)?,
            "5" => {
                info!("event=menu_exit module=cli status=ok reason=user");
                writeln!(output, "Exiting the program.")?;
                return Ok(());
            }
            _ => {
                warn!("event=menu_choice module=cli status=rejected");
                writeln!(
                    output,
                    "Invalid choice. Please enter a number between 1 and 5."
                )?;
            }
        }
    }
}

fn add_user<R: UserRepository>(
    service: &UserService<R>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()> {
    let id = prompt(input, output, "Enter User ID: ")?.unwrap_or_default();
    let name = prompt(input, output, "Enter User Name: ")?.unwrap_or_default();
    let email = prompt(input, output, "Enter User Email: ")?.unwrap_or_default();
    print_report(output, &service.create(&id, &name, &email))
}

fn display_users<R: UserRepository>(
    service: &UserService<R>,
    output: &mut impl Write,
) -> io::Result<()> {
    match service.list() {
        ListReport::Users(records) => {
            writeln!(output, "{HEADER}")?;
            for record in records {
                writeln!(output, "{}", record.to_line())?;
            }
            Ok(())
        }
        ListReport::Empty => writeln!(output, "{NO_USERS_MESSAGE}"),
        ListReport::Failed(report) => print_report(output, &report),
    }
}

fn update_user<R: UserRepository>(
    service: &UserService<R>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()> {
    let id = prompt(input, output, "Enter User ID to update: ")?.unwrap_or_default();
    let name = prompt(
        input,
        output,
        "Enter new name (leave blank to keep unchanged): ",
    )?;
    let email = prompt(
        input,
        output,
        "Enter new email (leave blank to keep unchanged): ",
    )?;
    let request = UpdateUserRequest { id, name, email };
    print_report(output, &service.update(&request))
}

fn delete_user<R: UserRepository>(
    service: &UserService<R>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()> {
    let id = prompt(input, output, "Enter User ID to delete: ")?.unwrap_or_default();
    print_report(output, &service.delete(&id))
}

fn print_report(output: &mut impl Write, report: &OperationReport) -> io::Result<()> {
    writeln!(output, "{}", report.message)
}

/// Prints `label` and reads one trimmed line; `None` at end of input.
fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
