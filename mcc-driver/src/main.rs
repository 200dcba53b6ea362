//! MicroC Compiler Driver
//! 
//! Command-line interface for the MicroC compiler: compile a source file to
//! an assembly listing, or dump its tokens or typed AST.

use clap::{Parser, Subcommand};
use log::info;
use mcc_codegen::EmitOptions;
use mcc_common::{Symbol, Type};
use mcc_frontend::{CompilationUnit, Frontend, Program};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mcc")]
#[command(about = "MicroC Compiler")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a MicroC source file to assembly
    Compile {
        /// Input MicroC source file
        input: PathBuf,
        
        /// Output assembly file (defaults to the input with a .s extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        
        /// Also write the typed AST as JSON next to the output
        #[arg(long)]
        emit_ast: bool,
        
        /// Omit the .data/.text sections
        #[arg(long)]
        no_data: bool,
        
        /// Indentation of instruction lines
        #[arg(long, default_value_t = 4)]
        indent: usize,
    },
    
    /// Print the token stream of a source file
    Tokens {
        input: PathBuf,
        
        /// Print tokens as JSON
        #[arg(long)]
        json: bool,
    },
    
    /// Print the typed AST of a source file as JSON
    Ast {
        input: PathBuf,
    },
}

/// A global entry as shown in the AST dump
#[derive(Serialize)]
struct GlobalDump {
    name: String,
    ty: Type,
}

#[derive(Serialize)]
struct AstDump<'a> {
    globals: Vec<GlobalDump>,
    program: &'a Program,
}

impl<'a> AstDump<'a> {
    fn new(unit: &'a CompilationUnit) -> Self {
        let globals = unit
            .symbols
            .globals()
            .map(|symbol: &Symbol| GlobalDump {
                name: symbol.name().to_string(),
                ty: symbol.ty(),
            })
            .collect();
        Self {
            globals,
            program: &unit.program,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    
    // Diagnostics carry line:column only; the file is named here
    let (input, result) = match cli.command {
        Commands::Compile { input, output, emit_ast, no_data, indent } => {
            let options = EmitOptions {
                data_section: !no_data,
                indent,
            };
            let result = compile_file(&input, output.as_deref(), emit_ast, &options);
            (input, result)
        }
        Commands::Tokens { input, json } => {
            let result = dump_tokens(&input, json);
            (input, result)
        }
        Commands::Ast { input } => {
            let result = dump_ast(&input);
            (input, result)
        }
    };
    
    if let Err(e) = result {
        eprintln!("Error: {}: {}", input.display(), e);
        std::process::exit(1);
    }
}

fn ast_json(unit: &CompilationUnit) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&AstDump::new(unit))
}

fn compile_file(
    input_path: &Path,
    output_path: Option<&Path>,
    emit_ast: bool,
    options: &EmitOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("compiling {}", input_path.display());
    let source = fs::read_to_string(input_path)?;
    
    let unit = Frontend::parse_source(&source)?;
    let listing = Frontend::generate(&unit)?;
    let asm_text = mcc_codegen::emit_program(&listing, options)?;
    
    let final_output_path = match output_path {
        Some(path) => path.to_path_buf(),
        None => input_path.with_extension("s"),
    };
    fs::write(&final_output_path, asm_text)?;
    println!("Assembly written to: {}", final_output_path.display());
    
    if emit_ast {
        let ast_path = final_output_path.with_extension("ast.json");
        fs::write(&ast_path, ast_json(&unit)?)?;
        println!("AST written to: {}", ast_path.display());
    }
    
    Ok(())
}

fn dump_tokens(input_path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(input_path)?;
    let tokens = Frontend::tokenize_source(&source)?;
    
    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }
    
    for token in tokens.iter().filter(|t| !t.token_type.is_trivia()) {
        println!("{}", token);
    }
    Ok(())
}

fn dump_ast(input_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(input_path)?;
    let unit = Frontend::parse_source(&source)?;
    println!("{}", ast_json(&unit)?);
    Ok(())
}
