fn main() -> anyhow::Result<()> {
    wayfarer_lib::run()
}
