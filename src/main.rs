use clap::{Parser, Subcommand};
use csv_core::{ReadFieldResult, ReaderBuilder};
use lasso::{Rodeo, RodeoResolver, Spur};
use log::info;
use smallvec::SmallVec;
use spatial_entropy::*;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::str;

/// Spatial entropy of typed point patterns.
///
/// Input is tab-separated, one point per line: every field but the last is a coordinate and the
/// last field is the point's type.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Read points from this file instead of standard input.
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Skip the first line of input.
    #[arg(long, global = true)]
    header: bool,

    /// Count (A, B) and (B, A) pairs separately.
    #[arg(long, global = true)]
    ordered: bool,

    /// Logarithm base of the reported entropies.
    #[arg(long, global = true, default_value_t = std::f64::consts::E)]
    base: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Entropy of pair types within a distance interval.
    Leibovici {
        /// Largest distance at which two points co-occur [default: 10].
        #[arg(short, long)]
        distance: Option<f64>,

        /// Smallest distance at which two points co-occur.
        #[arg(long, requires = "distance")]
        min_distance: Option<f64>,

        /// Find pairs with a grid index instead of a full distance matrix.
        #[arg(long)]
        grid: bool,
    },

    /// Mutual information and residual entropy of pair types across distance bands.
    Altieri {
        /// Number of equal-width cuts between zero and the maximum distance [default: 1].
        #[arg(short, long, conflicts_with = "breaks")]
        cut: Option<usize>,

        /// Comma-separated, strictly increasing band boundaries.
        #[arg(long, value_delimiter = ',')]
        breaks: Option<Vec<f64>>,
    },
}

type Point = SmallVec<[f64; 2]>;

struct Dataset {
    resolver: RodeoResolver<Spur>,
    points: Vec<Point>,
    labels: Vec<Spur>,
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

fn load_data<I: io::Read>(mut input: I, skip_header: bool) -> io::Result<Dataset> {
    let mut inputbuf = [0; 16384];
    let mut fieldbuf = [0; 1024];
    let mut fieldlen = 0;
    // Fields of the current record, stored end to end, with the end offset of each one.
    let mut record = Vec::new();
    let mut ends: SmallVec<[usize; 4]> = SmallVec::new();
    let mut skip = skip_header;
    let mut points: Vec<Point> = Vec::new();
    let mut labels = Vec::new();
    let mut rodeo = Rodeo::<Spur>::new();
    let mut tsv = ReaderBuilder::new().delimiter(b'\t').build();

    loop {
        let read = input.read(&mut inputbuf)?;
        let mut bytes = &inputbuf[..read];
        loop {
            let (result, nin, nout) = tsv.read_field(bytes, &mut fieldbuf[fieldlen..]);
            bytes = &bytes[nin..];
            fieldlen += nout;
            match result {
                ReadFieldResult::InputEmpty => break,
                ReadFieldResult::OutputFull => {
                    return Err(invalid_data(format!(
                        "field too long on line {}",
                        tsv.line()
                    )));
                }
                ReadFieldResult::Field { record_end } => {
                    record.extend_from_slice(&fieldbuf[..fieldlen]);
                    ends.push(record.len());
                    fieldlen = 0;
                    if !record_end {
                        continue;
                    }

                    let blank = ends.len() == 1 && record.is_empty();
                    if !blank && !std::mem::take(&mut skip) {
                        let line = tsv.line();
                        let (label, coordinates) = split_record(&record, &ends, line)?;
                        if let Some(first) = points.first() {
                            if first.len() != coordinates.len() {
                                return Err(invalid_data(format!(
                                    "line {} has {} coordinates, expected {}",
                                    line,
                                    coordinates.len(),
                                    first.len()
                                )));
                            }
                        }
                        points.push(coordinates);
                        labels.push(rodeo.get_or_intern(label));
                    }
                    record.clear();
                    ends.clear();
                }
                ReadFieldResult::End => {
                    info!(
                        "read {} points with {} distinct types",
                        points.len(),
                        rodeo.len()
                    );
                    return Ok(Dataset {
                        resolver: rodeo.into_resolver(),
                        points,
                        labels,
                    });
                }
            }
        }
    }
}

fn split_record<'a>(
    record: &'a [u8],
    ends: &[usize],
    line: u64,
) -> io::Result<(&'a str, Point)> {
    if ends.len() < 2 {
        return Err(invalid_data(format!(
            "line {} needs at least one coordinate and a type",
            line
        )));
    }

    let mut coordinates = Point::new();
    let mut start = 0;
    for &end in &ends[..ends.len() - 1] {
        let field = str::from_utf8(&record[start..end]).map_err(|e| invalid_data(e.to_string()))?;
        let value = field.trim().parse().map_err(|_| {
            invalid_data(format!("line {}: {:?} is not a coordinate", line, field))
        })?;
        coordinates.push(value);
        start = end;
    }

    let label = str::from_utf8(&record[start..]).map_err(|e| invalid_data(e.to_string()))?;
    Ok((label, coordinates))
}

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let data = match &cli.input {
        Some(path) => load_data(io::BufReader::new(File::open(path)?), cli.header)?,
        None => load_data(io::stdin().lock(), cli.header)?,
    };
    let labels: Vec<&str> = data
        .labels
        .iter()
        .map(|key| data.resolver.resolve(key))
        .collect();

    let to_io = |e: Error| io::Error::new(io::ErrorKind::InvalidInput, e);
    let base = LogBase::new(cli.base).map_err(|e| to_io(e.into()))?;
    let pairing = Pairing::from_ordered(cli.ordered);

    println!(
        "data: {} points, {} types",
        data.points.len(),
        TypeSet::new(&labels).len()
    );

    match cli.command {
        Command::Leibovici {
            distance,
            min_distance,
            grid,
        } => {
            let distance = match (min_distance, distance) {
                (Some(lo), Some(hi)) => Distance::Between(lo, hi),
                (None, Some(hi)) => Distance::UpTo(hi),
                _ => Distance::Default,
            };
            let backend = if grid { Backend::Grid } else { Backend::Dense };
            let result = Leibovici::new()
                .distance(distance)
                .pairing(pairing)
                .base(base)
                .backend(backend)
                .compute(&data.points, &labels)
                .map_err(to_io)?;

            println!("  links: {}", result.adjacency.link_count());
            for (a, b, count) in result.labelled_counts() {
                println!("  {}\t{}\t{}", a, b, count);
            }
            println!("  entropy: {:.5}", result.entropy);
        }

        Command::Altieri { cut, breaks } => {
            let cut = match (breaks, cut) {
                (Some(breaks), _) => Cut::Breaks(breaks),
                (None, Some(cut)) => Cut::Count(cut),
                (None, None) => Cut::Default,
            };
            let result = Altieri::new()
                .cut(cut)
                .pairing(pairing)
                .base(base)
                .compute(&data.points, &labels)
                .map_err(to_io)?;

            println!("  max distance: {:.5}", result.max_distance);
            for band in result.bands.iter() {
                println!(
                    "  band ({:.5}, {:.5}]: weight {:.5}, {} links, entropy {:.5}, mutual information {:.5}",
                    band.band.lo,
                    band.band.hi,
                    band.weight,
                    band.pair_counts.total(),
                    band.entropy,
                    band.mutual_info
                );
            }
            println!("  mutual information: {:.5}", result.mutual_info);
            println!("  residue: {:.5}", result.residue);
            println!("  entropy: {:.5}", result.entropy);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_coordinates_from_label() {
        let record = b"1.5-2type";
        let (label, coordinates) = split_record(record, &[3, 5, 9], 1).unwrap();
        assert_eq!(label, "type");
        assert_eq!(coordinates.as_slice(), &[1.5, -2.0]);
        assert!(split_record(b"x", &[1], 1).is_err());
    }

    #[test]
    fn loads_tab_separated_points() {
        let input = "x\ty\ttype\n0\t0\tA\n\n1\t0.5\tB\n2\t2\tA\n";
        let data = load_data(input.as_bytes(), true).unwrap();
        assert_eq!(data.points.len(), 3);
        assert_eq!(data.points[1].as_slice(), &[1.0, 0.5]);
        let labels: Vec<&str> = data.labels.iter().map(|k| data.resolver.resolve(k)).collect();
        assert_eq!(labels, vec!["A", "B", "A"]);

        assert!(load_data("0\t0\tA\n1\tB\n".as_bytes(), false).is_err());
    }
}
