// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::Result;
use std::env;
use std::thread;
use std::time::{Duration, Instant};

fn print_usage() {
    println!("midilink - MIDI device connection tool");
    println!();
    println!("Usage: midilink [OPTIONS]");
    println!();
    println!("Options:");
    #[cfg(target_os = "linux")]
    {
        println!("  --list               List available MIDI devices");
        println!("  --test-note <DEV>    Send a test note to device DEV (e.g. hw:1,0)");
        println!("  --monitor <DEV>      Monitor incoming MIDI from device DEV");
    }
    #[cfg(not(target_os = "linux"))]
    {
        println!("  --list               List available MIDI devices");
        println!("  --test-note <N>      Send a test note to the device at index N");
        println!("  --monitor <N>        Monitor incoming MIDI from the device at index N");
    }
    println!("  --help               Show this help message");
}

#[cfg(target_os = "linux")]
fn send_test_note(device: &str) -> Result<()> {
    println!("Opening {}...", device);
    let mut conn = midilink::open(device)?;

    let channel = 0; // MIDI channel 1
    let note = 60; // Middle C
    let velocity = 100;

    println!("Sending test note (Middle C, velocity {})...", velocity);
    conn.write(&[0x90 | channel, note, velocity])?;
    thread::sleep(Duration::from_millis(500));
    conn.write(&[0x80 | channel, note, 0])?;
    conn.close()?;

    println!("Test complete!");
    Ok(())
}

#[cfg(target_os = "linux")]
fn monitor(device: &str) -> Result<()> {
    println!("Opening {}...", device);
    let mut conn = midilink::open(device)?;

    println!("Monitoring MIDI input for 30 seconds (Ctrl+C to stop)...");
    let start = Instant::now();
    let mut buf = [0u8; 3];

    while start.elapsed() < Duration::from_secs(30) {
        let n = conn.read(&mut buf)?;
        if n > 0 {
            let bytes: Vec<String> = buf[..n].iter().map(|b| format!("{:02x}", b)).collect();
            println!("{}", bytes.join(" "));
        }
    }
    conn.close()?;

    println!();
    println!("Monitor complete!");
    Ok(())
}

#[cfg(target_os = "macos")]
fn send_test_note(device: &str) -> Result<()> {
    let index: usize = device.parse()?;
    println!("Opening device {}...", index);
    // Duplex devices share the source and destination index.
    let mut conn = midilink::EndpointConnection::open(index, index, 64)?;

    let channel = 0; // MIDI channel 1
    let note = 60; // Middle C
    let velocity = 100;

    println!("Sending test note (Middle C, velocity {})...", velocity);
    conn.write(&[0x90 | channel, note, velocity])?;
    thread::sleep(Duration::from_millis(500));
    conn.write(&[0x80 | channel, note, 0])?;
    conn.close()?;

    println!("Test complete!");
    Ok(())
}

#[cfg(target_os = "macos")]
fn monitor(device: &str) -> Result<()> {
    let index: usize = device.parse()?;
    println!("Opening device {}...", index);
    let mut conn = midilink::EndpointConnection::open(index, index, 64)?;

    println!("Monitoring MIDI input for 30 seconds (Ctrl+C to stop)...");
    let start = Instant::now();

    while start.elapsed() < Duration::from_secs(30) {
        for packet in conn.packets().drain() {
            println!("{}", packet);
        }
        thread::sleep(Duration::from_millis(1));
    }
    conn.close()?;

    println!();
    println!("Monitor complete!");
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn send_test_note(_device: &str) -> Result<()> {
    anyhow::bail!("no MIDI backend for this platform")
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn monitor(_device: &str) -> Result<()> {
    anyhow::bail!("no MIDI backend for this platform")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--list") => midilink::print_devices()?,
        Some("--test-note") => match args.get(2) {
            Some(device) => send_test_note(device)?,
            None => {
                eprintln!("--test-note requires a device argument");
                print_usage();
            }
        },
        Some("--monitor") => match args.get(2) {
            Some(device) => monitor(device)?,
            None => {
                eprintln!("--monitor requires a device argument");
                print_usage();
            }
        },
        Some("--help") | None => print_usage(),
        Some(other) => {
            eprintln!("Unknown option: {}", other);
            print_usage();
        }
    }
    Ok(())
}
