fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args().nth(1).unwrap_or_else(|| "settings.json".to_owned());
    atlascraft::launcher::run(settings_path)
}
