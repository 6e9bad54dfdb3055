//! cd - change the working directory
//!
//! `cd -` swaps with `OLDPWD` and prints the new directory; without an
//! argument `HOME` is used. `PWD` and `OLDPWD` are kept up to date in the
//! environment.

use crate::interpreter::errors::ExecResult;

pub fn handle_cd(args: &[String]) -> ExecResult {
    let mut print_target = false;
    let target = match args.first().map(String::as_str) {
        None => match std::env::var("HOME") {
            Ok(home) => home,
            Err(_) => {
                eprintln!("oxsh: cd: HOME not set");
                return Ok(1);
            }
        },
        Some("-") => match std::env::var("OLDPWD") {
            Ok(oldpwd) => {
                print_target = true;
                oldpwd
            }
            Err(_) => {
                eprintln!("oxsh: cd: OLDPWD not set");
                return Ok(1);
            }
        },
        Some(dir) => dir.to_string(),
    };

    let previous = std::env::var("PWD")
        .ok()
        .or_else(|| std::env::current_dir().ok().map(|p| p.display().to_string()))
        .unwrap_or_default();

    if let Err(e) = std::env::set_current_dir(&target) {
        eprintln!("oxsh: cd: {target}: {e}");
        return Ok(1);
    }

    let new_pwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or(target);
    std::env::set_var("OLDPWD", &previous);
    std::env::set_var("PWD", &new_pwd);
    if print_target {
        println!("{new_pwd}");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cd_missing_directory() {
        assert_eq!(handle_cd(&["/no/such/dir/oxsh".to_string()]), Ok(1));
    }
}
