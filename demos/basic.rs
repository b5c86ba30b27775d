use agileplace_http::{AgilePlaceClient, BoardQuery, ClientOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = AgilePlaceClient::from_env()?.with_options(ClientOptions {
        max_retries: 5,
        ..ClientOptions::default()
    });

    let me = client.get_current_user().await?;
    println!("signed in as {}", me["fullName"]);

    let boards = client.list_boards(&BoardQuery::default()).await?;
    for board in boards.as_array().into_iter().flatten() {
        println!("{} {}", board["id"], board["title"]);
    }

    Ok(())
}
