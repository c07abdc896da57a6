use std::process::ExitCode;

fn main() -> ExitCode {
    match lhcbdata::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
