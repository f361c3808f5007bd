use eyre::Report;

#[tokio::main]
async fn main() -> Result<(), Report> {
    bankline::run().await
}
