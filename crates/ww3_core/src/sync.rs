//! Typed change events mirrored into every known NAMELIST copy.
//!
//! The GUI turns widget state into a [`ChangeEvent`]; the bindings then run
//! [`NamelistSync::record`] on the config document, save it, and call
//! [`NamelistSync::apply`] to rewrite the affected NAMELIST files in the
//! template directory, the working directory and its nested-grid
//! subdirectories.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{keys, ConfigDocument};
use crate::error::{CoreError, CoreResult};
use crate::locale::FileSplit;
use crate::namelist::{self, names, Decimal, NamelistEdit, NamelistFile, NamelistValue, RewriteOutcome};
use crate::paths::{PathKey, PathResolver};
use crate::schemes::{self, SchemeStore};

/// Subdirectories of a working directory used by nested-grid runs.
pub const NESTED_SUBDIRS: [&str; 2] = ["coarse", "fine"];

/// A user change that must reach the NAMELIST files.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    SpectrumChanged {
        freq_inc: Decimal,
        freq_start: Decimal,
        freq_num: u32,
        dir_num: u32,
    },
    TimestepsChanged {
        dtmax: u32,
        dtxy: u32,
        dtkth: u32,
        dtmin: u32,
    },
    NearshoreChanged {
        zlim: Decimal,
        dmin: Decimal,
    },
    FileSplitChanged(FileSplit),
    OutputVarsApplied {
        scheme_name: String,
        codes: Vec<String>,
    },
}

impl ChangeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ChangeEvent::SpectrumChanged { .. } => "SpectrumChanged",
            ChangeEvent::TimestepsChanged { .. } => "TimestepsChanged",
            ChangeEvent::NearshoreChanged { .. } => "NearshoreChanged",
            ChangeEvent::FileSplitChanged(_) => "FileSplitChanged",
            ChangeEvent::OutputVarsApplied { .. } => "OutputVarsApplied",
        }
    }

    /// `(file name, edits)` per NAMELIST file the event touches.
    fn file_edits(&self) -> Vec<(&'static str, Vec<NamelistEdit>)> {
        use NamelistValue::{Float, Int, List, Signed};

        match self {
            ChangeEvent::SpectrumChanged {
                freq_inc,
                freq_start,
                freq_num,
                dir_num,
            } => {
                let g = names::SPECTRUM_NML;
                vec![(
                    names::WW3_GRID,
                    vec![
                        NamelistEdit::new(g, "SPECTRUM%XFR", Float(freq_inc.clone())),
                        NamelistEdit::new(g, "SPECTRUM%FREQ1", Float(freq_start.clone())),
                        NamelistEdit::new(g, "SPECTRUM%NK", Int(i64::from(*freq_num))),
                        NamelistEdit::new(g, "SPECTRUM%NTH", Int(i64::from(*dir_num))),
                    ],
                )]
            }
            ChangeEvent::TimestepsChanged {
                dtmax,
                dtxy,
                dtkth,
                dtmin,
            } => {
                let g = names::TIMESTEPS_NML;
                vec![(
                    names::WW3_GRID,
                    vec![
                        NamelistEdit::new(g, "TIMESTEPS%DTMAX", Int(i64::from(*dtmax))),
                        NamelistEdit::new(g, "TIMESTEPS%DTXY", Int(i64::from(*dtxy))),
                        NamelistEdit::new(g, "TIMESTEPS%DTKTH", Int(i64::from(*dtkth))),
                        NamelistEdit::new(g, "TIMESTEPS%DTMIN", Int(i64::from(*dtmin))),
                    ],
                )]
            }
            ChangeEvent::NearshoreChanged { zlim, dmin } => vec![(
                names::WW3_GRID,
                vec![
                    NamelistEdit::new(names::GRID_NML, "GRID%ZLIM", Signed(zlim.clone())),
                    NamelistEdit::new(names::GRID_NML, "GRID%DMIN", Signed(dmin.clone())),
                ],
            )],
            ChangeEvent::FileSplitChanged(split) => {
                let code = Int(split.timesplit());
                vec![
                    (
                        names::WW3_OUNF,
                        vec![NamelistEdit::new(names::FIELD_NML, "FIELD%TIMESPLIT", code.clone())],
                    ),
                    (
                        names::WW3_OUNP,
                        vec![NamelistEdit::new(names::POINT_NML, "POINT%TIMESPLIT", code.clone())],
                    ),
                    (
                        names::WW3_TRNC,
                        vec![NamelistEdit::new(names::TRACK_NML, "TRACK%TIMESPLIT", code)],
                    ),
                ]
            }
            ChangeEvent::OutputVarsApplied { codes, .. } => {
                let codes = schemes::normalize_codes(codes.iter().map(String::as_str));
                if codes.is_empty() {
                    return Vec::new();
                }
                vec![
                    (
                        names::WW3_OUNF,
                        vec![NamelistEdit::new(names::FIELD_NML, "FIELD%LIST", List(codes.clone()))],
                    ),
                    (
                        names::WW3_SHEL,
                        vec![NamelistEdit::new(names::TYPE_NML, "TYPE%FIELD%LIST", List(codes))],
                    ),
                ]
            }
        }
    }
}

/// Edits planned for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePlan {
    pub path: PathBuf,
    pub edits: Vec<NamelistEdit>,
}

/// What [`NamelistSync::apply`] did, per file.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, CoreError)>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes change events into every known NAMELIST file.
#[derive(Debug, Clone)]
pub struct NamelistSync {
    template_dir: PathBuf,
    work_dir: Option<PathBuf>,
}

impl NamelistSync {
    pub fn new(template_dir: impl Into<PathBuf>, work_dir: Option<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            work_dir,
        }
    }

    /// Directories taken from `PUBLIC_WW3_PATH` and `CURRENT_WORKDIR`.
    pub fn from_document(resolver: &PathResolver, doc: &ConfigDocument) -> Self {
        let template_dir = resolver
            .resolve(doc, PathKey::PublicWw3)
            .unwrap_or_else(|| resolver.root().join("public").join("ww3"));
        Self::new(template_dir, resolver.resolve(doc, PathKey::CurrentWorkdir))
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    /// Template dir, working dir, then its `coarse/` and `fine/`, each once.
    pub fn known_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.template_dir.clone()];
        if let Some(work) = &self.work_dir {
            dirs.push(work.clone());
            dirs.extend(NESTED_SUBDIRS.iter().map(|sub| work.join(sub)));
        }
        let mut unique: Vec<PathBuf> = Vec::with_capacity(dirs.len());
        for dir in dirs {
            if !unique.contains(&dir) {
                unique.push(dir);
            }
        }
        unique
    }

    /// Files and edits for `event`, without touching disk.
    pub fn plan(&self, event: &ChangeEvent) -> Vec<FilePlan> {
        let file_edits = event.file_edits();
        self.known_dirs()
            .iter()
            .flat_map(|dir| {
                file_edits.iter().map(move |(file, edits)| FilePlan {
                    path: dir.join(file),
                    edits: edits.clone(),
                })
            })
            .collect()
    }

    /// Rewrite every planned file. A failure on one file is logged and
    /// recorded; the remaining files are still written.
    pub fn apply(&self, event: &ChangeEvent) -> SyncReport {
        let mut report = SyncReport::default();
        for plan in self.plan(event) {
            match namelist::rewrite(&plan.path, &plan.edits) {
                Ok(RewriteOutcome::Written(_)) => report.written.push(plan.path),
                Ok(RewriteOutcome::Skipped) => report.skipped.push(plan.path),
                Err(e) => {
                    tracing::error!("{}: {}", event.name(), e);
                    report.failed.push((plan.path, e));
                }
            }
        }
        tracing::info!(
            "{}: {} file(s) processed, {} missing, {} failed",
            event.name(),
            report.written.len(),
            report.skipped.len(),
            report.failed.len()
        );
        report
    }

    /// Mirror `event` into the config document.
    pub fn record(event: &ChangeEvent, doc: &mut ConfigDocument) -> CoreResult<()> {
        match event {
            ChangeEvent::SpectrumChanged {
                freq_inc,
                freq_start,
                freq_num,
                dir_num,
            } => {
                doc.set(keys::FREQ_INC, freq_inc.to_string());
                doc.set(keys::FREQ_START, freq_start.to_string());
                doc.set(keys::FREQ_NUM, freq_num.to_string());
                doc.set(keys::DIR_NUM, dir_num.to_string());
            }
            ChangeEvent::TimestepsChanged {
                dtmax,
                dtxy,
                dtkth,
                dtmin,
            } => {
                doc.set(keys::DTMAX, dtmax.to_string());
                doc.set(keys::DTXY, dtxy.to_string());
                doc.set(keys::DTKTH, dtkth.to_string());
                doc.set(keys::DTMIN, dtmin.to_string());
            }
            ChangeEvent::NearshoreChanged { zlim, dmin } => {
                doc.set(keys::GRID_ZLIM, zlim.to_string());
                doc.set(keys::GRID_DMIN, dmin.to_string());
            }
            ChangeEvent::FileSplitChanged(split) => {
                doc.set_enum(*split);
            }
            ChangeEvent::OutputVarsApplied { scheme_name, codes } => {
                SchemeStore::open(doc).upsert(scheme_name, codes.as_slice())?;
            }
        }
        Ok(())
    }

    /// Spectrum values from the template `ww3_grid.nml`, keyed by config key.
    ///
    /// Empty if the file or the block is missing.
    pub fn read_spectrum_from_template(&self) -> BTreeMap<String, String> {
        self.read_template(
            names::SPECTRUM_NML,
            &[
                (keys::FREQ_INC, "SPECTRUM%XFR"),
                (keys::FREQ_START, "SPECTRUM%FREQ1"),
                (keys::FREQ_NUM, "SPECTRUM%NK"),
                (keys::DIR_NUM, "SPECTRUM%NTH"),
            ],
        )
    }

    /// `GRID_ZLIM` / `GRID_DMIN` from the template `ww3_grid.nml`.
    pub fn read_nearshore_from_template(&self) -> BTreeMap<String, String> {
        self.read_template(
            names::GRID_NML,
            &[(keys::GRID_ZLIM, "GRID%ZLIM"), (keys::GRID_DMIN, "GRID%DMIN")],
        )
    }

    fn read_template(&self, group: &str, mapping: &[(&str, &str)]) -> BTreeMap<String, String> {
        let path = self.template_dir.join(names::WW3_GRID);
        let file = match NamelistFile::read(&path) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!("Template {} not readable: {}", path.display(), e);
                return BTreeMap::new();
            }
        };
        mapping
            .iter()
            .filter_map(|(config_key, nml_key)| {
                file.value(group, nml_key)
                    .map(|v| (config_key.to_string(), v.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const GRID_NML_TEXT: &str = "\
! WAVEWATCH III ww3_grid.nml
&SPECTRUM_NML
! frequency increment factor
  SPECTRUM%XFR       =  1.1
! first frequency (Hz)
  SPECTRUM%FREQ1     =  0.04118
  SPECTRUM%NK        =  32
! number of directions
  SPECTRUM%NTH       =  24
/

&TIMESTEPS_NML
  TIMESTEPS%DTMAX    =  900
  TIMESTEPS%DTXY     =  300
  TIMESTEPS%DTKTH    =  450
  TIMESTEPS%DTMIN    =  15
/

&GRID_NML
  GRID%NAME          =  'ww3'
  GRID%ZLIM          =  -0.05
/
";

    fn count_lines_with(content: &str, needle: &str) -> usize {
        content.lines().filter(|l| l.contains(needle)).count()
    }

    fn decimal(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn spectrum_change_rewrites_only_assignments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(names::WW3_GRID);
        fs::write(&path, GRID_NML_TEXT).unwrap();

        let sync = NamelistSync::new(dir.path(), None);
        let report = sync.apply(&ChangeEvent::SpectrumChanged {
            freq_inc: decimal("1.15"),
            freq_start: decimal("0.05"),
            freq_num: 36,
            dir_num: 36,
        });
        assert!(report.is_clean());
        assert_eq!(report.written, vec![path.clone()]);

        let content = fs::read_to_string(&path).unwrap();
        let file = NamelistFile::parse(&path, &content);
        assert_eq!(file.value("SPECTRUM_NML", "SPECTRUM%XFR"), Some("1.15"));
        assert_eq!(file.value("SPECTRUM_NML", "SPECTRUM%FREQ1"), Some("0.05"));
        assert_eq!(file.value("SPECTRUM_NML", "SPECTRUM%NK"), Some("36"));
        assert_eq!(file.value("SPECTRUM_NML", "SPECTRUM%NTH"), Some("36"));

        for comment in [
            "! frequency increment factor\n",
            "! first frequency (Hz)\n",
            "! number of directions\n",
        ] {
            assert!(content.contains(comment), "lost comment {:?}", comment);
        }
        assert_eq!(count_lines_with(&content, "SPECTRUM%"), 4);
        let terminators = content.lines().filter(|l| l.trim() == "/").count();
        assert_eq!(terminators, 3);
        // Other blocks untouched.
        assert!(content.contains("  TIMESTEPS%DTMAX    =  900\n"));
    }

    #[test]
    fn file_split_reaches_every_known_directory() {
        let root = tempdir().unwrap();
        let template = root.path().join("public").join("ww3");
        let work = root.path().join("workSpace").join("run1");
        let dirs = [
            template.clone(),
            work.clone(),
            work.join("coarse"),
            work.join("fine"),
        ];
        for dir in &dirs {
            fs::create_dir_all(dir).unwrap();
            fs::write(dir.join(names::WW3_OUNF), "&FIELD_NML\n  FIELD%TIMESPLIT = 0\n/\n").unwrap();
            fs::write(dir.join(names::WW3_OUNP), "&POINT_NML\n  POINT%TIMESPLIT = 0\n/\n").unwrap();
            fs::write(dir.join(names::WW3_TRNC), "&TRACK_NML\n  TRACK%TIMESPLIT = 0\n/\n").unwrap();
        }

        let sync = NamelistSync::new(&template, Some(work));
        let report = sync.apply(&ChangeEvent::FileSplitChanged(FileSplit::Month));
        assert!(report.is_clean());
        assert_eq!(report.written.len(), 12);

        for dir in &dirs {
            for (file, group, key) in [
                (names::WW3_OUNF, "FIELD_NML", "FIELD%TIMESPLIT"),
                (names::WW3_OUNP, "POINT_NML", "POINT%TIMESPLIT"),
                (names::WW3_TRNC, "TRACK_NML", "TRACK%TIMESPLIT"),
            ] {
                let nml = NamelistFile::read(dir.join(file)).unwrap();
                assert_eq!(nml.value(group, key), Some("6"), "{}", dir.join(file).display());
            }
        }
    }

    #[test]
    fn nearshore_inserts_missing_dmin_before_terminator() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(names::WW3_GRID);
        fs::write(&path, GRID_NML_TEXT).unwrap();

        let sync = NamelistSync::new(dir.path(), None);
        sync.apply(&ChangeEvent::NearshoreChanged {
            zlim: decimal("-0.1"),
            dmin: decimal("2.5"),
        });

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        let zlim = lines.iter().position(|l| l.contains("GRID%ZLIM")).unwrap();
        let dmin = lines.iter().position(|l| l.contains("GRID%DMIN")).unwrap();

        assert_eq!(dmin, zlim + 1);
        assert_eq!(lines[dmin + 1].trim(), "/");
        assert_eq!(lines[dmin].split('=').nth(1).unwrap().trim(), "2.5");
        assert_eq!(lines[zlim].split('=').nth(1).unwrap().trim(), "-0.1");
        assert_eq!(count_lines_with(&content, "GRID%ZLIM"), 1);
    }

    #[test]
    fn missing_files_are_skipped() {
        let dir = tempdir().unwrap();
        let sync = NamelistSync::new(dir.path(), Some(dir.path().join("nowhere")));

        let report = sync.apply(&ChangeEvent::TimestepsChanged {
            dtmax: 900,
            dtxy: 300,
            dtkth: 450,
            dtmin: 15,
        });
        assert!(report.is_clean());
        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), 4);
    }

    #[test]
    fn one_failing_file_does_not_stop_the_others() {
        crate::logging::init_test_tracing();
        let root = tempdir().unwrap();
        let template = root.path().join("template");
        let work = root.path().join("work");
        fs::create_dir_all(&template).unwrap();
        fs::create_dir_all(&work).unwrap();

        // A directory where the file should be cannot be read.
        fs::create_dir_all(template.join(names::WW3_GRID)).unwrap();
        fs::write(work.join(names::WW3_GRID), GRID_NML_TEXT).unwrap();

        let sync = NamelistSync::new(&template, Some(work.clone()));
        let report = sync.apply(&ChangeEvent::TimestepsChanged {
            dtmax: 1200,
            dtxy: 400,
            dtkth: 600,
            dtmin: 10,
        });

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, template.join(names::WW3_GRID));
        assert!(matches!(report.failed[0].1, CoreError::NamelistWriteFailed { .. }));
        assert_eq!(report.written, vec![work.join(names::WW3_GRID)]);

        let nml = NamelistFile::read(work.join(names::WW3_GRID)).unwrap();
        assert_eq!(nml.value("TIMESTEPS_NML", "TIMESTEPS%DTMAX"), Some("1200"));
    }

    #[test]
    fn output_vars_write_field_lists() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(names::WW3_OUNF),
            "&FIELD_NML\n  FIELD%TIMESTART = '20100101 000000'\n  FIELD%LIST = 'HS'\n/\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(names::WW3_SHEL),
            "&TYPE_NML\n  TYPE%FIELD%LIST = 'HS DIR'\n/\n",
        )
        .unwrap();

        let sync = NamelistSync::new(dir.path(), None);
        let event = ChangeEvent::OutputVarsApplied {
            scheme_name: "Storm".into(),
            codes: vec!["hs".into(), "TWS".into(), "HS".into()],
        };
        assert!(sync.apply(&event).is_clean());

        let ounf = NamelistFile::read(dir.path().join(names::WW3_OUNF)).unwrap();
        assert_eq!(ounf.value("FIELD_NML", "FIELD%LIST"), Some("HS TWS"));
        assert_eq!(
            ounf.value("FIELD_NML", "FIELD%TIMESTART"),
            Some("20100101 000000")
        );
        let shel = NamelistFile::read(dir.path().join(names::WW3_SHEL)).unwrap();
        assert_eq!(shel.value("TYPE_NML", "TYPE%FIELD%LIST"), Some("HS TWS"));
    }

    #[test]
    fn known_dirs_are_deduplicated() {
        let sync = NamelistSync::new("/srv/ww3", Some(PathBuf::from("/srv/ww3")));
        assert_eq!(
            sync.known_dirs(),
            vec![
                PathBuf::from("/srv/ww3"),
                PathBuf::from("/srv/ww3/coarse"),
                PathBuf::from("/srv/ww3/fine"),
            ]
        );

        let sync = NamelistSync::new("/srv/ww3", None);
        assert_eq!(sync.known_dirs(), vec![PathBuf::from("/srv/ww3")]);
    }

    #[test]
    fn plan_targets_files_per_directory() {
        let sync = NamelistSync::new("/t", Some(PathBuf::from("/w")));
        let plans = sync.plan(&ChangeEvent::FileSplitChanged(FileSplit::Hour));

        assert_eq!(plans.len(), 12);
        assert_eq!(plans[0].path, PathBuf::from("/t/ww3_ounf.nml"));
        assert_eq!(plans[0].edits[0].value, NamelistValue::Int(10));
        assert!(plans.iter().any(|p| p.path == PathBuf::from("/w/fine/ww3_trnc.nml")));
    }

    #[test]
    fn record_updates_config_keys() {
        let mut doc = ConfigDocument::defaults();

        NamelistSync::record(
            &ChangeEvent::SpectrumChanged {
                freq_inc: decimal("1.1"),
                freq_start: decimal("0.04118"),
                freq_num: 32,
                dir_num: 24,
            },
            &mut doc,
        )
        .unwrap();
        assert_eq!(doc.get_str(keys::FREQ_INC), "1.1");
        assert_eq!(doc.get_str(keys::FREQ_START), "0.04118");
        assert_eq!(doc.get_str(keys::FREQ_NUM), "32");

        NamelistSync::record(&ChangeEvent::FileSplitChanged(FileSplit::Year), &mut doc).unwrap();
        assert_eq!(doc.get_str(keys::FILE_SPLIT), "Year");

        NamelistSync::record(
            &ChangeEvent::NearshoreChanged {
                zlim: decimal("-0.1"),
                dmin: decimal("2.5"),
            },
            &mut doc,
        )
        .unwrap();
        assert_eq!(doc.get_str(keys::GRID_ZLIM), "-0.1");

        NamelistSync::record(
            &ChangeEvent::OutputVarsApplied {
                scheme_name: "Swell".into(),
                codes: vec!["PHS".into(), "PTP".into()],
            },
            &mut doc,
        )
        .unwrap();
        let store = SchemeStore::open(&mut doc);
        assert_eq!(store.get("Swell"), Some(vec!["PHS".to_string(), "PTP".to_string()]));
    }

    #[test]
    fn record_rejects_empty_scheme() {
        let mut doc = ConfigDocument::defaults();
        let err = NamelistSync::record(
            &ChangeEvent::OutputVarsApplied {
                scheme_name: "Empty".into(),
                codes: Vec::new(),
            },
            &mut doc,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn template_read_back() {
        let dir = tempdir().unwrap();
        let sync = NamelistSync::new(dir.path(), None);
        assert!(sync.read_spectrum_from_template().is_empty());

        fs::write(dir.path().join(names::WW3_GRID), GRID_NML_TEXT).unwrap();
        let spectrum = sync.read_spectrum_from_template();
        assert_eq!(spectrum.get(keys::FREQ_INC).map(String::as_str), Some("1.1"));
        assert_eq!(spectrum.get(keys::DIR_NUM).map(String::as_str), Some("24"));

        let nearshore = sync.read_nearshore_from_template();
        assert_eq!(nearshore.get(keys::GRID_ZLIM).map(String::as_str), Some("-0.05"));
        assert!(!nearshore.contains_key(keys::GRID_DMIN));
    }
}
