use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match certsweep::cli::start::start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
