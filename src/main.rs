fn main() -> anyhow::Result<()> {
    pollster::block_on(hammock::run())
}
