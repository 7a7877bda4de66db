use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    phoenix_poses::apps::run_prepare_phoenix(std::env::args().skip(1))
}
