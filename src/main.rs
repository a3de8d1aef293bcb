//! Minimal operator CLI over the credential library. Useful for seeding user
//! documents by hand and for checking what a stored record will do at login.

use std::env;

use folio_auth::accounts::login_check;
use folio_auth::crypto::passwords::{hash_password, verify_password};

fn print_usage() {
    eprintln!("Commands:\n  hash-password <plaintext>\n  verify-password <plaintext> <record>\n  login-check <plaintext> <record>");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "hash-password" => {
            if args.len() != 3 {
                return print_usage();
            }
            match hash_password(&args[2]) {
                Ok(record) => println!("{record}"),
                Err(err) => eprintln!("hashing failed: {err}"),
            }
        }
        "verify-password" => {
            if args.len() != 4 {
                return print_usage();
            }
            match verify_password(&args[2], &args[3]) {
                Ok(true) => println!("match"),
                Ok(false) => println!("no-match"),
                Err(err) => eprintln!("verification failed: {err}"),
            }
        }
        "login-check" => {
            if args.len() != 4 {
                return print_usage();
            }
            // The collapsed boundary: any failure reads the same as a wrong
            // password.
            println!(
                "{}",
                if login_check(&args[2], &args[3]) {
                    "allow"
                } else {
                    "deny"
                }
            );
        }
        _ => print_usage(),
    }
}
