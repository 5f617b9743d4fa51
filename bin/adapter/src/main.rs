use graphql_http_adapter_server::adapter_entrypoint;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    adapter_entrypoint().await?;

    Ok(())
}
