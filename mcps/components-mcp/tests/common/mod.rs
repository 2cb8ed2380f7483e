//! Shared fixture corpus for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use components_mcp::CorpusLoader;
use tempfile::TempDir;

pub const BADGE_1: &str =
    "<span class=\"rounded-full bg-purple-100 px-2.5 py-0.5 text-sm text-purple-700\">Badge</span>\n";

pub const ACCORDION_INDEX: &str = "import { HSAccordion } from './core';\n\
export default class Accordion extends HSAccordion {\n  static autoInit() {}\n}\n";

/// Files of the standard corpus, relative to the root
pub const FILES: &[(&str, &str)] = &[
    ("hyperui/application/badges/1.html", BADGE_1),
    (
        "hyperui/application/badges/1-dark.html",
        "<span class=\"rounded-full bg-purple-900 text-purple-100\">Badge</span>\n",
    ),
    (
        "hyperui/application/modals/1.html",
        "<div role=\"dialog\" class=\"rounded-lg bg-white p-6 shadow-lg\">\n  <h2>Confirm</h2>\n</div>\n",
    ),
    (
        "hyperui/application/modals/1-dark.html",
        "<div role=\"dialog\" class=\"rounded-lg bg-gray-900 p-6 text-white\">\n  <h2>Confirm</h2>\n</div>\n",
    ),
    (
        "hyperui/marketing/banners/1.html",
        "<section class=\"bg-gray-50\"><h1>Understand user flow</h1></section>\n",
    ),
    ("daisyui/modal.css", ".modal { display: grid; place-items: center; }\n"),
    ("daisyui/button.css", ".btn { display: inline-flex; }\n"),
    ("flyonui/css/accordion.css", ".accordion { display: block; }\n"),
    ("flyonui/plugins/accordion/index.ts", ACCORDION_INDEX),
    (
        "flyonui/plugins/accordion/types.ts",
        "export interface IAccordionOptions {\n  isAlwaysOpened?: boolean;\n}\n",
    ),
    (
        "headlessui-react/components/dialog/BasicDialog.tsx",
        "import { Dialog } from '@headlessui/react'\n\nexport default function BasicDialog() {\n  return <Dialog open onClose={() => {}} />\n}\n",
    ),
];

/// A corpus in a temporary directory
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    /// The standard corpus, plus an empty `headlessui-vue` framework
    pub fn standard() -> Self {
        let fixture = Self::empty();
        for (rel, content) in FILES {
            fixture.write(rel, content.as_bytes());
        }
        fs::create_dir_all(fixture.root().join("headlessui-vue")).unwrap();
        fixture
    }

    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, content: &[u8]) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn loader(&self) -> CorpusLoader {
        CorpusLoader::new(self.root())
    }
}

/// Number of components in the standard corpus
pub fn standard_count() -> usize {
    FILES.len()
}
