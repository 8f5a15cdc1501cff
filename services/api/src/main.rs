use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match mortify_api::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mortify-api: {err}");
            ExitCode::FAILURE
        }
    }
}
