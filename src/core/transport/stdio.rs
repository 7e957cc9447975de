//! STDIO transport implementation.
//!
//! One JSON-RPC message per line on stdin, one response per line on stdout.
//! Logs go to stderr so they never interleave with protocol output.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use super::TransportResult;
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until stdin is closed.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        Self::serve(server, stdin, stdout).await?;

        info!("STDIO transport finished");
        Ok(())
    }

    /// Serve line-delimited messages from `reader`, writing responses to `writer`.
    ///
    /// Blank lines are skipped and notifications produce no output. Lines are
    /// handled as raw bytes, so invalid UTF-8 gets a parse error response
    /// instead of ending the loop.
    pub async fn serve<R, W>(
        server: McpServer,
        mut reader: R,
        mut writer: W,
    ) -> TransportResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let line = buf.trim_ascii();
            if line.is_empty() {
                continue;
            }

            let ctx = server.new_call_context();
            let Some(response) = server.handle_message(line, &ctx).await else {
                debug!("Notification handled, nothing to write");
                continue;
            };

            let mut out = serde_json::to_vec(&response)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }

        Ok(())
    }
}
