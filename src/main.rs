use mcp_link_checker::config::ServerConfig;
use mcp_link_checker::logging;
use mcp_link_checker::server::McpServer;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("mcp-link-checker: configuration error: {e}");
            std::process::exit(1);
        }
    };

    let mut server = match McpServer::new(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("mcp-link-checker: startup error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        eprintln!("mcp-link-checker: fatal error: {e}");
        std::process::exit(1);
    }
}
