use std::{
    env, fs,
    path::{Path, PathBuf},
    process::{self, Command},
    time::Instant,
};

use ajisai::{compile_source_timed, display_error};

const USAGE: &str = "Usage: ajisai <source> [--emit-c <path>] [--mm-debug]";

const C_FLAGS: [&str; 5] = [
    "-std=c11",
    "-Wno-unused-variable",
    "-Wno-unused-parameter",
    "-Wno-unused-value",
    "-Wno-unused-but-set-variable",
];

struct Options {
    source_path: String,
    emit_c: Option<PathBuf>,
    mm_debug: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut source_path = None;
    let mut emit_c = None;
    let mut mm_debug = false;

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--emit-c" => {
                let Some(path) = args.next() else {
                    return Err(String::from("--emit-c expects a path"));
                };
                emit_c = Some(PathBuf::from(path));
            }
            "--mm-debug" => mm_debug = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown flag {}", flag));
            }
            path => {
                if source_path.is_some() {
                    return Err(String::from("Only one source file can be compiled"));
                }
                source_path = Some(String::from(path));
            }
        }
    }

    let Some(source_path) = source_path else {
        return Err(String::from("No source file provided"));
    };

    Ok(Options {
        source_path,
        emit_c,
        mm_debug,
    })
}

fn write_or_exit(path: &Path, contents: &str) {
    if let Err(error) = fs::write(path, contents) {
        eprintln!("Failed to write {}: {}", path.display(), error);
        process::exit(1);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args[1..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let file_name = Path::new(&options.source_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| options.source_path.clone());

    let source = match fs::read_to_string(&options.source_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", options.source_path, error);
            process::exit(1);
        }
    };

    let start = Instant::now();

    let c_source = match compile_source_timed(&source, &file_name, |phase, elapsed| {
        println!("{} in {:?}", phase, elapsed)
    }) {
        Ok(c_source) => c_source,
        Err(error) => {
            display_error(&error, &options.source_path, &source);
            process::exit(1);
        }
    };

    println!("Total time for C generation: {:?}", start.elapsed());

    if let Some(path) = options.emit_c {
        write_or_exit(&path, &c_source);
        println!("Wrote {}", path.display());
        return;
    }

    if let Err(error) = fs::create_dir_all("build") {
        eprintln!("Failed to create build directory: {}", error);
        process::exit(1);
    }
    write_or_exit(Path::new("build/out.c"), &c_source);

    let c_compiler = env::var("CC").unwrap_or_else(|_| String::from("cc"));
    let runtime_dir = PathBuf::from(
        env::var("AJISAI_RUNTIME_DIR").unwrap_or_else(|_| String::from("runtime")),
    );

    let mut command = Command::new(&c_compiler);
    command.args(C_FLAGS);
    if options.mm_debug {
        command.arg("-DAJISAI_MM_DEBUG");
    }
    command
        .arg("-I")
        .arg(&runtime_dir)
        .arg("build/out.c")
        .arg(runtime_dir.join("ajisai_runtime.c"))
        .args(["-o", "build/output"]);

    let output = match command.output() {
        Ok(output) => output,
        Err(error) => {
            eprintln!("Failed to run {}: {}", c_compiler, error);
            process::exit(1);
        }
    };

    print!("{}", String::from_utf8_lossy(&output.stdout));
    eprint!("{}", String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        process::exit(output.status.code().unwrap_or(1));
    }

    println!("Compiled using {}", c_compiler);
    println!("Total time: {:?}", start.elapsed());
}
