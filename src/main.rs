fn main() -> anyhow::Result<()> {
    phong_scene::run()
}
