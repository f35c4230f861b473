//! Build-description artifact: `Makefile`.
//!
//! The ROOT flags are queried once at generation time and embedded
//! literally, so the Makefile works in environments where `root-config`
//! is only available inside the generator's shell.

use crate::toolchain::RootFlags;

const TEMPLATE: &str = r#"# Auto-generated Makefile for __CLASS__

CXX = g++
CXXFLAGS = -O2 -Wall -fPIC __ROOT_CFLAGS__
LDFLAGS = __ROOT_LIBS__

TARGET = runAnalysis

SRCS = main.cc __CLASS__.C
OBJS = $(SRCS:.cc=.o)
OBJS := $(OBJS:.C=.o)

all: $(TARGET)

$(TARGET): $(OBJS)
	$(CXX) -o $@ $^ $(LDFLAGS)
	@echo "-----------------------------------------"
	@echo " Build complete. Executable: ./$(TARGET)"
	@echo "-----------------------------------------"

%.o: %.cc
	$(CXX) $(CXXFLAGS) -c $< -o $@

%.o: %.C
	$(CXX) $(CXXFLAGS) -c $< -o $@

clean:
	rm -f *.o $(TARGET)
"#;

pub fn render(class_name: &str, flags: &RootFlags) -> String {
    TEMPLATE
        .replace("__ROOT_CFLAGS__", &flags.cflags)
        .replace("__ROOT_LIBS__", &flags.libs)
        .replace("__CLASS__", class_name)
}
