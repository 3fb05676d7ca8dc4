#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    studio_timetable::run().await
}
