use gust::error::AppResult;

fn main() -> AppResult<()> {
    gust::entry::run()
}
