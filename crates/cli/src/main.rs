use std::process::ExitCode;

fn main() -> ExitCode {
    chukui_cli::run()
}
