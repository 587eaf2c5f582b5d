use std::process;

use retropom_cli::UserCancelled;

#[tokio::main]
async fn main() {
    if let Err(e) = retropom_cli::main(std::env::args().collect::<Vec<String>>().as_slice()).await
    {
        if e.downcast_ref::<UserCancelled>().is_none() {
            eprintln!("Error: {e:#}");
        }
        process::exit(1);
    }
}
