use std::process::ExitCode;

use toxbot::ui::output;

fn main() -> ExitCode {
    match toxbot::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
