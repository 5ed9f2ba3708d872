extern crate argparse;
extern crate librapidtape;
extern crate rand;
extern crate tracing;
extern crate tracing_subscriber;

use argparse::{ArgumentParser, Store, StoreOption};
use std::{env, io, fs, time};
use std::io::Write;
use rand::RngCore;
use tracing::info;
use tracing_subscriber::EnvFilter;
use librapidtape::{units, tuning};
use librapidtape::blocking::FixedRecordWriter;
use librapidtape::copier::StreamCopier;
use librapidtape::fs::open_tape;
use librapidtape::tape::TapeDevice;

/// Endless source of pseudo-random bytes.
struct RandomSource;

impl io::Read for RandomSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        rand::thread_rng().fill_bytes(buf);
        Ok(buf.len())
    }
}

fn report(verb: &str, size: u64, start_instant: time::Instant) {
    let elapsed = start_instant.elapsed();
    let float_secs = elapsed.as_secs() as f64 + elapsed.subsec_nanos() as f64 / (1000 * 1000 * 1000) as f64;
    let rate = units::DataSize::from(size as f64 / float_secs.max(1e-9));

    eprintln!("{} {} in {} ({}/s)", verb, units::DataSize::from(size), units::HRDuration::from(elapsed), rate);
}

/// Copy a file (or stdin) onto the tape through a record-aligned buffer.
fn write_tape(device: &TapeDevice, filename: &str, tuning: &tuning::Configuration) -> io::Result<()> {
    let copier = StreamCopier::new(tuning.copy_buffer_size);
    let mut blocked = FixedRecordWriter::new(device.output_view()?, tuning.record_size, tuning.buffer_capacity)?;

    eprintln!("Beginning copy to tape...");
    let start_instant = time::Instant::now();
    let size = match filename {
        "-" => copier.copy(&mut io::stdin(), &mut blocked)?,
        name => copier.copy(&mut fs::File::open(name)?, &mut blocked)?
    };
    blocked.flush()?;

    report("Wrote", size, start_instant);
    Ok(())
}

/// Copy everything up to the next file mark (or end of data) off the tape.
fn read_tape(device: &TapeDevice, filename: &str, tuning: &tuning::Configuration) -> io::Result<()> {
    let copier = StreamCopier::new(tuning.copy_buffer_size);
    let mut input = device.input_view()?;

    let start_instant = time::Instant::now();
    let size = match filename {
        "-" => copier.copy(&mut input, &mut io::stdout())?,
        name => copier.copy(&mut input, &mut fs::File::create(name)?)?
    };

    report("Read", size, start_instant);
    Ok(())
}

/// Write a bounded amount of random data, rewind, and read it all back.
fn roundtrip(device: &TapeDevice, limit: u64, tuning: &tuning::Configuration) -> io::Result<()> {
    let copier = StreamCopier::new(tuning.copy_buffer_size);

    eprint!("Writing file...");
    let start_instant = time::Instant::now();
    let mut blocked = FixedRecordWriter::new(device.output_view()?, tuning.record_size, tuning.buffer_capacity)?;
    let wrote = copier.with_limit(limit).copy(&mut RandomSource, &mut blocked)?;
    blocked.flush()?;
    eprintln!("done.");
    report("Wrote", wrote, start_instant);

    eprint!("Rewinding device...");
    device.rewind()?;
    eprintln!("done.");

    eprint!("Reading file...");
    let start_instant = time::Instant::now();
    let read = copier.copy(&mut device.input_view()?, &mut io::sink())?;
    eprintln!("done.");
    report("Read", read, start_instant);

    Ok(())
}

/// Build the tuning configuration from the sizes given on the command line.
///
/// A record size on its own rounds the default buffer down to fit it; an
/// explicit buffer size is taken as-is and must be a record multiple.
fn configure(record_size: Option<usize>, buffer_size: Option<usize>, copy_size: Option<usize>) -> tuning::Configuration {
    let mut tuning = tuning::Configuration::default();

    if let Some(record_size) = record_size {
        tuning = tuning.with_record_size(record_size);
    }

    if let Some(buffer_size) = buffer_size {
        tuning.buffer_capacity = buffer_size;
    }

    if let Some(copy_size) = copy_size {
        tuning.copy_buffer_size = copy_size;
    }

    tuning
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("RAPIDTAPE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    //Here's some configuration!
    let mut tapename = env::var("TAPE").unwrap_or("".to_string());
    let mut command = "".to_string();
    let mut argument = "".to_string();
    let mut filename = "-".to_string();
    let mut record_size : Option<units::DataSize<usize>> = None;
    let mut buffer_size : Option<units::DataSize<usize>> = None;
    let mut copy_size : Option<units::DataSize<usize>> = None;
    let mut limit = units::DataSize::from(5 * 1024 * 1024 as u64);

    {
        let mut ap = ArgumentParser::new();

        ap.set_description("Exercise and transfer data to or from a tape drive");

        ap.refer(&mut tapename).add_option(&["-f"], Store, "The tape device to control (otherwise reads $TAPE)");
        ap.refer(&mut filename).add_option(&["-o"], Store, "A file to transfer data to or from. (Use - or don't specify for stdio)");
        ap.refer(&mut record_size).add_option(&["--bs"], StoreOption, "The record size every write to the tape is padded to.");
        ap.refer(&mut buffer_size).add_option(&["--buffer"], StoreOption, "How many bytes to collect before writing to the tape. Must be a multiple of --bs. (Defaults to about 1m, rounded down to a multiple of --bs)");
        ap.refer(&mut copy_size).add_option(&["--copy_buffer"], StoreOption, "How many bytes to move per read.");
        ap.refer(&mut limit).add_option(&["--limit"], Store, "How many bytes of random data to write during roundtrip.");
        ap.refer(&mut command).add_argument("operation", Store, "One of write, read, roundtrip, eod, rewind, blocksize, setblocksize.");
        ap.refer(&mut argument).add_argument("argument", Store, "The new block size, for setblocksize.");

        ap.parse_args_or_exit();
    }

    let tuning = configure(record_size.map(|s| s.into_inner()), buffer_size.map(|s| s.into_inner()), copy_size.map(|s| s.into_inner()));

    if tapename == "" {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "Please specify a device name, either with -f or TAPE environment variable"));
    }

    let device = open_tape(&tapename, &tuning)?;
    info!(device = %tapename, operation = %command, "tape opened");

    let result = match command.as_ref() {
        "write" => write_tape(&device, &filename, &tuning),
        "read" => read_tape(&device, &filename, &tuning),
        "roundtrip" => roundtrip(&device, limit.into_inner(), &tuning),
        "eod" => {
            eprint!("Rewinding...");
            device.rewind()?;
            eprintln!("done!");

            eprint!("Spacing to end of data...");
            device.space_to_end_of_data()?;
            eprintln!("done!");
            Ok(())
        },
        "rewind" => device.rewind().map_err(io::Error::from),
        "blocksize" => { println!("{}", device.block_size()?); Ok(()) },
        "setblocksize" => match argument.parse::<units::DataSize<usize>>() {
            Ok(size) => device.set_block_size(size.into_inner()).map_err(io::Error::from),
            Err(e) => Err(io::Error::new(io::ErrorKind::InvalidInput, format!("Bad block size {:?}: {}", argument, e)))
        },
        _ => Err(io::Error::new(io::ErrorKind::InvalidInput, format!("Command {} not recognized", command))),
    };

    eprint!("Closing device...");
    device.close();
    eprintln!("done!");

    io::stderr().flush()?;
    result
}
