use std::sync::Arc;

use chat_stream_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    let client = ChatClient::from_env()?;
    let conversation = client.create_conversation().await?;

    let mut view = ChatView::new();
    let mut session = view.begin();
    let mut sink = MarkdownView::new(Arc::new(PulldownRenderer));

    let bytes = client
        .open_chat_stream("Stream a short greeting.", &conversation.id)
        .await?;
    let outcome = session.consume(bytes, &mut sink).await;

    println!("{}", sink.html());
    eprintln!("outcome: {outcome:?}");
    Ok(())
}
