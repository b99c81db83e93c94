// Writes the leadboard man page: `generate-man [OUT_DIR]` (default: current directory)

use clap::CommandFactory;
use leadboard::cli::Cli;
use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)?;

    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd.clone());
    let mut buffer: Vec<u8> = Vec::new();
    man.render(&mut buffer)?;

    let path = out_dir.join("leadboard.1");
    std::fs::write(&path, buffer)?;
    println!("Wrote {}", path.display());

    // One page per subcommand, e.g. leadboard-move.1
    for sub in cmd.get_subcommands() {
        let name = format!("leadboard-{}", sub.get_name());
        let page = clap_mangen::Man::new(sub.clone()).title(name.to_uppercase());
        let mut buffer: Vec<u8> = Vec::new();
        page.render(&mut buffer)?;
        let path = out_dir.join(format!("{}.1", name));
        std::fs::write(&path, buffer)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
