use swarmstrike::error::AppResult;

fn main() -> AppResult<()> {
    swarmstrike::run()
}
