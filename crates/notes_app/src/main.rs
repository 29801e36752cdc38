mod popup;

fn main() -> anyhow::Result<()> {
    popup::run_app()
}
