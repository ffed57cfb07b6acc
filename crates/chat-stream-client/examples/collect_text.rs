use chat_stream_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    let client = ChatClient::from_env()?;
    let conversation = client.create_conversation().await?;

    let text = client
        .collect_text("Say hello in one sentence.", &conversation.id)
        .await?;
    println!("{text}");
    Ok(())
}
