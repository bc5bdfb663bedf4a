use std::env;

use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base = env::var("APP_URL").unwrap_or_else(|_| String::from("http://localhost:4000"));
    let client = reqwest::Client::new();

    for path in ["/users", "/users/3"] {
        let resp = client
            .get(format!("{base}{path}"))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        println!("{path}: {:#}", resp);
    }

    let echoed = client
        .post(format!("{base}/echo"))
        .body("Hello from the client")
        .send()
        .await?
        .text()
        .await?;
    println!("/echo: {:#?}", echoed);
    Ok(())
}
