use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use glbuffers::{
    Value,
    buffer::{Buffer, BufferUsage, HostBackend},
    parse_format,
};

/// Print the layout of a buffer format and, given records, their packed bytes.
///
/// Example: glbuffers "(3f)[vertex](1I)[id]" "(((0, 1, 0), (7,)),)"
#[derive(Parser, Debug)]
#[command(name = "glbuffers")]
struct Args {
    /// Format string, e.g. "(3f)[vertex](1I)[id]"
    format: String,

    /// RON sequence of records to pack and upload
    records: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    log4rs::init_file("log4rs.yml", Default::default())
        .context("failed to load logging config file")?;

    #[cfg(feature = "tracing")]
    let _client = tracy_client::Client::start();

    let spec = &args.format;
    let format = parse_format(spec).with_context(|| format!("invalid format {spec:?}"))?;

    println!("format {format} ({} bytes per record)", format.record_size());
    for field in format.fields() {
        println!(
            "  {:<16} {:>3} x {:<8} offset {:>4}  gl 0x{:04X}",
            field.name,
            field.count,
            field.element_type,
            field.offset,
            field.element_type.gl_type()
        );
    }

    let Some(literal) = args.records else {
        return Ok(());
    };
    let records = match literal
        .parse::<Value>()
        .with_context(|| format!("invalid records literal {literal:?}"))?
    {
        Value::Seq(records) => records,
        other => anyhow::bail!("records must be a sequence, got {other}"),
    };

    let bytes = format.pack(&records).context("failed to pack records")?;

    let backend = Arc::new(HostBackend::new());
    let buffer = Buffer::array(backend, &format, BufferUsage::StaticDraw)
        .context("failed to create buffer")?;
    buffer.init(&records).context("failed to upload records")?;
    log::debug!("uploaded {} record(s), {} bytes", records.len(), buffer.size()?);

    let chunks = bytes.chunks_exact(format.record_size());
    for (index, (chunk, record)) in chunks.zip(buffer.records()?).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        println!("[{index}] {}  {record}", hex.join(" "));
    }

    Ok(())
}
